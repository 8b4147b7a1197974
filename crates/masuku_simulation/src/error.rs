//! Ошибки конфигурации (загрузка attack table).
//!
//! Всё, что тут описано, фатально на старте: симуляция без полной таблицы
//! атак не запускается.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read attack table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("attack table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("attack '{attack}': combo key '{key}' is not a button index")]
    InvalidComboKey { attack: String, key: String },

    #[error("attack '{attack}': combo successor '{next}' is not defined")]
    UnknownComboSuccessor { attack: String, next: String },

    #[error("attack '{attack}': hit frame {frame} is outside the {frames}-frame animation")]
    HitFrameOutOfRange {
        attack: String,
        frame: usize,
        frames: usize,
    },

    #[error("attack '{attack}': frame_time must be positive")]
    ZeroFrameTime { attack: String },

    #[error("attack table is missing required attack '{0}'")]
    MissingAttack(String),
}
