//! Feedback services.

mod composer;

pub use composer::{
    CommentSource, ComposedFeedback, DEFAULT_GENERATOR_TIMEOUT, FeedbackComposer,
    template_comment,
};
