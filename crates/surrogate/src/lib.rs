//! This library implements surrogate regression models used to approximate
//! objective functions known only through sampled data.
//!
//! Two variants are available, both trained on `(x, y)` samples and predicting
//! a value together with an uncertainty estimate:
//!
//! * [GpSurrogate]: Gaussian process regression (a.k.a. Kriging) based on
//!   [egobox-gp](https://docs.rs/egobox-gp), the uncertainty being the predicted
//!   standard deviation,
//! * [LipschitzianRegressor]: Lipschitzian regression, the prediction being
//!   the middle of the Lipschitz enclosure of the data and the uncertainty its half-width.
//!
//! The variants form a closed set: a [SurrogateSpec] (variant and parameters)
//! is trained into a [SurrogateModel], and every trained model implements the
//! [Surrogate] trait.
//!
//! # Features
//!
//! ## serializable
//!
//! The `serializable` feature enables serialization of parameters and trained
//! models based on [serde crate](https://serde.rs/).
//!
//! ## persistent
//!
//! The `persistent` feature enables `save()`/`load()` of a trained model
//! to/from a json file.
//!
//! # Example
//!
//! ```no_run
//! use ndarray::array;
//! use paretobox_surrogate::{GpSurrogateParams, Surrogate, SurrogateSpec};
//!
//! let xt = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
//! let yt = array![0.0, 1.0, 1.5, 0.9, 1.0];
//!
//! let model = SurrogateSpec::from(GpSurrogateParams::default())
//!     .train(&xt.view(), &yt.view())
//!     .expect("GP training");
//! let (values, std_devs) = model
//!     .predict_with_uncertainty(&array![[2.5]].view())
//!     .expect("GP prediction");
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod errors;
mod gaussian_process;
pub mod lipschitzian;
mod parameters;
mod surrogates;
mod utils;

pub use errors::*;
pub use gaussian_process::*;
pub use lipschitzian::LipschitzianRegressor;
pub use parameters::*;
pub use surrogates::*;
