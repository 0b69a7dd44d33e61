/// What a screen renders: a loading flag, the last error message and the
/// last successfully received data.
///
/// `begin` clears the error, and each completion sets exactly one of
/// `data` / `error`. A failure keeps the previous data visible.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    loading: bool,
    error: Option<String>,
    data: Option<T>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
        }
    }
}

impl<T> ViewState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self, data: T) {
        self.loading = false;
        self.error = None;
        self.data = Some(data);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_clears_error() {
        let mut view: ViewState<u32> = ViewState::new();
        view.fail("boom");
        view.begin();
        assert!(view.is_loading());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut view = ViewState::new();
        view.begin();
        view.succeed(vec![1, 2, 3]);
        view.begin();
        view.fail("Failed to load vehicles");

        assert!(!view.is_loading());
        assert_eq!(view.error(), Some("Failed to load vehicles"));
        assert_eq!(view.data(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_success_clears_loading() {
        let mut view = ViewState::new();
        view.begin();
        view.succeed("ok");
        assert!(!view.is_loading());
        assert_eq!(view.data(), Some(&"ok"));
        assert!(view.error().is_none());
    }
}
