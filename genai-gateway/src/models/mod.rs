//! Domain types shared by validation, dispatch and normalization.

pub mod generation;

pub use generation::{
    ImageAttachment, ImageModelKind, ImageReference, ImageRequest, ImageSize, TextModel,
    TextRequest,
};
