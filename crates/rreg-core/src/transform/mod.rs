//! Parametric spatial transformations and transformation spaces.
//!
//! A [`TransformationSpace`] maps a parameter vector to a concrete
//! [`Transform`]; spaces compose into product spaces whose parameter
//! vectors concatenate and whose transforms chain left-to-right.

pub mod deformation;
pub mod product;
pub mod rigid;
pub mod rotation;
pub mod trait_;
pub mod translation;

pub use deformation::{DeformationBasis, DeformationTransform, GaussianBumpBasis, LowRankDeformationSpace};
pub use product::{ProductSpace, ProductTransform};
pub use rigid::{rigid_space_2d, rigid_space_3d, RigidSpace2d, RigidSpace3d};
pub use rotation::{Rotation2dTransform, Rotation3dTransform, RotationSpace2d, RotationSpace3d};
pub use trait_::{Transform, TransformationSpace};
pub use translation::{TranslationSpace, TranslationTransform};
