#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    InvalidEmail(String),
    EmptyPassword,
    InvalidUsername(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidEmail(email) => {
                write!(f, "Invalid email address: {}", email)
            }
            DomainError::EmptyPassword => {
                write!(f, "Password must not be empty")
            }
            DomainError::InvalidUsername(username) => {
                write!(f, "Invalid username: {}", username)
            }
        }
    }
}

impl std::error::Error for DomainError {}

pub type DomainResult<T> = Result<T, DomainError>;
