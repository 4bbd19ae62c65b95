use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ano selecionado nao encontrado: {label}")]
pub struct LookupError {
    pub label: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("a tabela precisa de pelo menos uma linha")]
    Empty,
    #[error("ano duplicado: {0}")]
    DuplicateLabel(String),
}

// The authoritative dataset is never touched when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error(
        "Nao foi possivel converter {value:?} na coluna {column:?} de {year_label:?}. Verifique se todos os campos sao numericos."
    )]
    Conversion {
        year_label: String,
        column: String,
        value: String,
    },
    #[error(
        "Valor ausente na coluna {column:?} de {year_label:?}. Preencha todos os campos com numeros validos."
    )]
    MissingValue { year_label: String, column: String },
    #[error("Valor invalido {value} na coluna {column:?} de {year_label:?}: {reason}")]
    InvalidValue {
        year_label: String,
        column: String,
        value: f64,
        reason: &'static str,
    },
    #[error("A tabela editada nao corresponde aos dados: {0}")]
    Shape(String),
}
