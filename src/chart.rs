pub mod figure;
pub mod options;
pub mod painter;
pub mod raster;
pub mod render;
pub mod theme;

pub use self::figure::*;
pub use self::options::{ChartOptions, ImageKind};
pub use self::painter::{border_color, ChartPainter};
pub use self::raster::{add_border, encode, stack_vertically};
pub use self::render::{Banner, PlottersRenderer, Renderer};
pub use self::theme::{Color, Theme};
