#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod error;
pub mod event;
pub mod history;
pub mod input;
pub mod panels;
pub mod raster;
pub mod settings;
pub mod smoother;
pub mod stroke;
pub mod view;

pub use app::PaintApp;
pub use canvas::{DrawingStatus, Repaint, StrokeCanvas};
pub use error::{CanvasError, CanvasResult};
pub use event::{CanvasEvent, EventHandler};
pub use input::ContactEvent;
pub use raster::{Rasterizer, SoftwareRasterizer};
pub use settings::BrushSettings;
pub use smoother::{Smoothed, smooth_segment};
pub use stroke::{BrushMode, Segment, Stroke};
