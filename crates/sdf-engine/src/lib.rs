pub mod accumulator;
pub mod executor;
pub mod normalize;
pub mod plans;
pub mod sampler;

pub use accumulator::FrameStats;
pub use executor::{
    BondLengthOutput, Executor, FrameWindow, PdfOutput, Plan, PlanOutput, RdfOutput,
};
pub use normalize::{normalize_pdf, normalize_rdf, rdf_values, RdfNormalization};
pub use plans::{BondLengthPlan, PdfPlan, RdfGeometry, RdfPlan, SpeciesPair};
pub use sampler::{
    sample_positions, Displacement, DistanceSink, MinimumImage, NoCorrection, PairCount,
    PairSampler, Pairing,
};

#[cfg(test)]
mod tests;
