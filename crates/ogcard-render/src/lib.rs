//! Social preview card rendering.
//!
//! Turns a vector illustration plus a page title and description into a
//! fixed-size PNG card: gradient background, the illustration scaled against
//! the right edge, and wrapped text on the left.

pub mod composer;
pub mod composite;
pub mod escape;
pub mod layout;
pub mod naming;
pub mod raster;

pub use composer::{CardText, Composite, ImageComposer, RenderError};
pub use composite::{CompositeTemplate, IllustrationSource, Theme};
pub use escape::escape_xml;
pub use layout::{IllustrationPlacement, Layout, SvgViewport, TextBlock, TextLine, TextStyle, HEIGHT, WIDTH};
pub use raster::{encode_png, Rasterizer};
