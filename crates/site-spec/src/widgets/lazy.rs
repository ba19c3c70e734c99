use serde::Serialize;

/// Image whose real source is swapped in on first intersection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LazyImage {
    data_src: String,
    src: Option<String>,
    lazy: bool,
}

impl LazyImage {
    pub fn new(data_src: impl Into<String>) -> Self {
        Self {
            data_src: data_src.into(),
            src: None,
            lazy: true,
        }
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Returns false once the image has already been loaded.
    pub fn reveal(&mut self) -> bool {
        if !self.lazy {
            return false;
        }
        self.src = Some(self.data_src.clone());
        self.lazy = false;
        true
    }
}
