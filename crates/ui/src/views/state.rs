use services::GENERATION_FAILED_MESSAGE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Generation,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Generation => GENERATION_FAILED_MESSAGE,
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}
