//! Code smell detectors
//!
//! Threshold rules over supplied metrics, in two levels.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DetectionEngine                         │
//! │  - Fans types out over a rayon pool                         │
//! │  - Runs method rules, then class rules, per type            │
//! │  - Tallies a DetectionSummary                               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │ MethodLevelSmellDetector  │──▶│ ClassLevelSmellDetector   │
//! │  MethodRule per smell     │   │  ClassRule per smell      │
//! │  Type -> MethodsDetected  │   │  MethodsDetected -> Type  │
//! └───────────────────────────┘   └───────────────────────────┘
//! ```
//!
//! # Rules
//!
//! ## Method level
//! - `LongMethodRule`, `HighComplexityRule`, `LongParameterListRule`
//! - `FeatureEnvyRule`, `DispersedCouplingRule`, `IntensiveCouplingRule`
//! - `ShotgunSurgeryRule`, `MessageChainRule`, `BrainMethodRule`
//!
//! ## Class level
//! - `GodClassRule`, `BrainClassRule`, `ComplexClassRule`, `SpaghettiCodeRule`
//! - `DataClassRule`, `LazyClassRule`, `ClassDataShouldBePrivateRule`
//! - `RefusedBequestRule`, `SpeculativeGeneralityRule`
//!
//! # Usage
//!
//! ```
//! use smellgraph::detectors::{ClassLevelSmellDetector, MethodLevelSmellDetector};
//! use smellgraph::models::{Entity, MethodSpec, Type};
//!
//! let ty = Type::new("Order")
//!     .with_method(MethodSpec::new("total()").with_metric("cyclomaticComplexity", 25.0));
//! let detected = MethodLevelSmellDetector::new().apply(ty);
//! let ty = ClassLevelSmellDetector::new().apply(detected);
//! assert_eq!(ty.methods()[0].smells().len(), 1);
//! ```

pub mod base;
pub mod class_level;
pub mod engine;
pub mod method_level;

pub use base::{ClassRule, DetectionSummary, DetectorConfig, MethodRule};
pub use class_level::{
    configured_class_rules, default_class_rules, ClassFacts, ClassLevelSmellDetector,
};
pub use engine::{DetectionEngine, ProgressCallback};
pub use method_level::{
    configured_method_rules, default_method_rules, MethodLevelSmellDetector, MethodsDetected,
};
