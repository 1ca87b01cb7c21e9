#![warn(clippy::all, clippy::pedantic)]

// disable some style lints
#![allow(clippy::needless_return, clippy::must_use_candidate, clippy::comparison_chain)]
#![allow(clippy::redundant_field_names, clippy::redundant_closure_for_method_calls)]
#![allow(clippy::unreadable_literal, clippy::option_if_let_else, clippy::range_plus_one)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap, clippy::cast_lossless, clippy::cast_sign_loss)]
#![allow(clippy::default_trait_access)]

// Tests lints
#![cfg_attr(test, allow(clippy::float_cmp))]

//! `fcclusters` finds the atomic clusters (pairs, triplets, quadruplets, ...)
//! entering a Taylor expansion of the interatomic forces in a periodic
//! crystal.
//!
//! The main entry point is [`Interactions`], which takes a [`Structure`], the
//! list of symmetry-distinct (representative) atoms, and
//! [`InteractionParameters`] with the cutoff radii for each interaction
//! order. Harmonic force constants mapping uses [`MinimumDistances`].

pub mod types;
pub use types::*;

mod errors;
pub use self::errors::Error;

pub mod systems;
pub use systems::{Structure, UnitCell, Periodicity, Translations};

pub mod interactions;
pub use interactions::{Interactions, InteractionParameters, Cutoffs};
pub use interactions::{CutoffTable, Order};
pub use interactions::{Cluster, ClusterSet, NeighborList};
pub use interactions::{PeriodicImages, DistanceTable};
pub use interactions::{DistInfo, MinimumDistances};
