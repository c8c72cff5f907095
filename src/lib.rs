//! Deterministic procedural solar systems
//!
//! A standalone library for generating a star, planets with moons and an
//! asteroid field inside a cubic chunk of space, each with a synthesized
//! surface mesh. The same seed always reproduces the same system. Output is
//! engine-agnostic: meshes are plain position/normal/index buffers.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_solar_system::*;
//!
//! // Configure and generate
//! let config = SystemConfigBuilder::new()
//!     .seed("61")
//!     .chunk_size(512.0).unwrap()
//!     .planet_detail(4)
//!     .build().unwrap();
//!
//! let mut generator = SolarSystemGenerator::new(config);
//! let system = generator.regenerate();
//! println!("Generated {} bodies", system.len());
//!
//! // Inspect a body
//! if let Some(planet) = system.planets().first() {
//!     println!("{}", system.detail_table(*planet).unwrap());
//! }
//!
//! // Simulate
//! if let Some(system) = generator.system_mut() {
//!     system.step(1.0 / 60.0);
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) nearest-asteroid lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, bodies and meshes

// Modules
pub mod error;
pub mod config;
pub mod random;
pub mod noise;
pub mod mesh;
pub mod naming;
pub mod orbit;
pub mod body;
pub mod factory;
pub mod picking;
pub mod system;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{SystemError, Result};
pub use config::{BodyProfile, SystemConfig, SystemConfigBuilder, MAX_ECCENTRICITY};
pub use random::{RandomStream, Seed};
pub use noise::NoiseField;
pub use mesh::{build_box, build_polyhedron, MeshGeometry, PolyhedronParams, MAX_DETAIL};
pub use naming::generate_name;
pub use orbit::OrbitState;
pub use body::{BodyDetails, BodyHandle, BodyKind, CelestialBody, DetailTable, PointLight};
pub use factory::{BodyFactory, ParentRef};
pub use picking::{pick_body, PickHit};
pub use system::{generate_system, Chunk, GeneratorState, SolarSystem, SolarSystemGenerator};

#[cfg(feature = "spatial-index")]
pub use spatial::AsteroidIndex;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;
