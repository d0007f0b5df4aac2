//! Radiance HDR codec and vertical-cross cubemap / equirectangular projection.
//!
//! Pure in-memory transforms on linear-RGB `f32` buffers; no file-system
//! access, `no_std` + `alloc` compatible.
//!
//! # Modules
//!
//! - [`radiance`]: `.hdr` decode/encode (RGBE, RLE and flat scanlines, all scan orientations)
//! - [`cross`]: vertical-cross cubemap layout validation and face access
//! - [`equirect`]: equirectangular layout, latitude/longitude mapping
//! - [`face`]: cube faces, face selection, gnomonic projection
//! - [`project`]: cross ↔ equirect resampling
//! - [`orientation`]: Radiance scan orientation (D4 dihedral group)
//!
//! ```
//! use zencross::{EquirectLayout, PixelBuffer, cross_to_equirect, equirect_to_cross, radiance};
//!
//! let pano = PixelBuffer::from_fn(64, 32, |x, y| [x as f32 / 64.0, y as f32 / 32.0, 0.25]).unwrap();
//! let hdr = radiance::encode(&pano).unwrap();
//!
//! let pano = EquirectLayout::new(radiance::decode(&hdr).unwrap());
//! let cross = equirect_to_cross(&pano, 16).unwrap().image;
//! assert_eq!(cross.buffer().width(), 48);
//!
//! let back = cross_to_equirect(&cross, 64, 32).unwrap();
//! assert!(back.warning.is_none());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod buffer;
pub mod cross;
pub mod equirect;
pub mod error;
pub mod face;
pub mod orientation;
pub mod project;
pub mod radiance;
mod sample;

pub use buffer::{PixelBuffer, Rect, Size};
pub use cross::CrossLayout;
pub use equirect::{AspectWarning, EquirectLayout};
pub use error::{DimensionError, EncodeError, FormatError, FormatErrorKind};
pub use face::Face;
pub use orientation::Orientation;
pub use project::{Converted, cross_to_equirect, equirect_to_cross};
