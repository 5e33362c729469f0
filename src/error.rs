use thiserror::Error;

#[derive(Error, Debug)]
pub enum SanitizerError {
    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Archivo no encontrado: {0}")]
    FileNotFound(String),

    #[error("Carpeta no encontrada: {0}")]
    FolderNotFound(String),

    #[error("No se encontraron fotos: {0}")]
    NoImagesFound(String),

    #[error("Error de conexión: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error del servidor ({status}): {detail}")]
    Service { status: u16, detail: String },

    #[error("JSON inválido: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de entrada: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] gmb_sanitizer_common::Error),
}

pub type Result<T> = std::result::Result<T, SanitizerError>;
