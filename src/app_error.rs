use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    TestFailure = 1,
    Fatal = 2,
}

#[derive(Debug)]
pub struct AppError {
    code: ExitCode,
    message: String,
}

impl AppError {
    pub fn test_failure<T: Into<String>>(message: T) -> Self {
        Self {
            code: ExitCode::TestFailure,
            message: message.into(),
        }
    }

    pub fn fatal<T: Into<String>>(message: T) -> Self {
        Self {
            code: ExitCode::Fatal,
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}
