mod bayer;
mod bswap;
mod context;
mod copy;
mod dispatch;
mod dither;
mod error;
mod gray_float;
mod numerics;
mod nv;
mod p01x;
mod palette;
mod pix_fmt;
mod rgb_packed;
mod rgb_planar;
mod rgb_to_yuv;
mod rw;
mod slice;
mod yuv_to_rgb;
mod yuy2;

pub use context::ConvertContext;
pub use context::DitherMode;
pub use context::YuvRange;
pub use context::YuvStandardMatrix;

pub use pix_fmt::BayerPattern;
pub use pix_fmt::ColorModel;
pub use pix_fmt::FormatDescriptor;
pub use pix_fmt::PixelFormat;

pub use slice::DestSlice;
pub use slice::SourceSlice;
pub use slice::MAX_PLANES;

pub use dispatch::is_conversion_supported;
pub use dispatch::ConvertSession;
pub use dispatch::SliceConvert;

pub use error::ConvertError;
pub use error::MismatchedSize;
