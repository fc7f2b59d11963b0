pub mod homeworks;
pub mod status;

use thiserror::Error;

/// Payload problems found after a successful fetch. These are reported to the chat.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HomeworkError {
    #[error("Неверный формат данных: {0}")]
    Shape(&'static str),
    #[error("В записи о работе отсутствует ключ {0}")]
    MissingField(&'static str),
    #[error("Неизвестный статус работы: {0}")]
    UnknownStatus(String),
}

pub type HomeworkResult<T> = Result<T, HomeworkError>;
