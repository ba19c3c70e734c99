use serde::Serialize;

use crate::spec::TestimonialSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Testimonial {
    pub name: String,
    pub role: String,
    pub text: String,
    pub rating: u8,
}

impl From<&TestimonialSpec> for Testimonial {
    fn from(spec: &TestimonialSpec) -> Self {
        Self {
            name: spec.name.clone(),
            role: spec.role.clone(),
            text: spec.text.clone(),
            rating: spec.rating.min(5),
        }
    }
}

const EXTRA_SLIDES: [(&str, &str, &str); 3] = [
    (
        "Sarah Johnson",
        "Food Critic",
        "Ann's Restaurant offers the most authentic flavors I've ever experienced. The attention to detail in every dish is remarkable.",
    ),
    (
        "Michael Chen",
        "Regular Customer",
        "I've been coming here for years. The consistency in quality and the warm atmosphere keeps me coming back.",
    ),
    (
        "Emily Rodriguez",
        "Food Blogger",
        "The presentation and taste are absolutely perfect. This is definitely a hidden gem in the city!",
    ),
];

/// Testimonial carousel: the slides in the page plus three appended at load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestimonialSlider {
    slides: Vec<Testimonial>,
}

impl TestimonialSlider {
    /// `None` when the page has no slider to append to.
    pub fn new(existing: Option<&[TestimonialSpec]>) -> Option<Self> {
        let existing = existing?;
        let slides = existing
            .iter()
            .map(Testimonial::from)
            .chain(EXTRA_SLIDES.iter().map(|(name, role, text)| Testimonial {
                name: (*name).to_string(),
                role: (*role).to_string(),
                text: (*text).to_string(),
                rating: 5,
            }))
            .collect();
        Some(Self { slides })
    }

    pub fn slides(&self) -> &[Testimonial] {
        &self.slides
    }
}
