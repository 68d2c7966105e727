//! The models module supplies the bit predictors for the context-mixing
//! profiles.
//!
//! Every predictor answers the same three questions: what is the
//! probability the next bit is one, what to revise once the bit is known,
//! and what to revise once a whole byte has completed. The compression
//! and decompression drivers call those hooks in exactly the same order
//! on both sides; the models carry no other synchronization, so any
//! ordering drift between encoder and decoder corrupts the stream.
//!
pub mod bit_context;
pub mod byte_context;
pub mod match_model;
pub mod mixer;
pub mod state_table;

pub use bit_context::BitContextModel;
pub use byte_context::ByteContextModel;
pub use match_model::MatchModel;
pub use mixer::Mixer;
pub use state_table::StateTable;

/// The prediction every model falls back to when it has no evidence.
pub const P_NEUTRAL: u16 = 0x8000;

/// A bit predictor with per-bit and per-byte update hooks.
pub trait Predictor {
    /// Probability of the next bit being one, on the 16-bit axis.
    fn predict(&self) -> u16;
    /// Revise statistics after the bit value is known.
    fn update_bit(&mut self, bit: u8);
    /// Revise context after all eight bits of a byte have completed.
    fn update_byte(&mut self, byte: u8);
}

/// The full predictor bank used by the `ctxmix` and `bwt` profiles: an
/// order-1 and an order-2 byte context, a 16-bit bit context and the
/// match model, fused by the adaptive mixer.
///
/// The bank owns its predictors in a plain vector; the mixer only ever
/// sees their probabilities, never the predictors themselves.
pub struct MixModel {
    predictors: Vec<Box<dyn Predictor>>,
    mixer: Mixer,
    probs: Vec<u16>,
}

impl MixModel {
    pub fn new() -> Self {
        let predictors: Vec<Box<dyn Predictor>> = vec![
            Box::new(ByteContextModel::new(1)),
            Box::new(ByteContextModel::new(2)),
            Box::new(BitContextModel::new(16)),
            Box::new(MatchModel::new()),
        ];
        let count = predictors.len();
        Self {
            predictors,
            mixer: Mixer::new(count),
            probs: vec![P_NEUTRAL; count],
        }
    }

    /// Gather every model's opinion and mix them into one probability.
    pub fn predict(&mut self) -> u16 {
        for (slot, model) in self.probs.iter_mut().zip(&self.predictors) {
            *slot = model.predict();
        }
        self.mixer.mix(&self.probs)
    }

    /// Feed the now-known bit to the mixer and every predictor.
    pub fn update(&mut self, bit: u8) {
        self.mixer.update(bit);
        for model in &mut self.predictors {
            model.update_bit(bit);
        }
    }

    /// Roll the completed byte into every predictor's context.
    pub fn update_byte(&mut self, byte: u8) {
        for model in &mut self.predictors {
            model.update_byte(byte);
        }
    }
}

impl Default for MixModel {
    fn default() -> Self {
        Self::new()
    }
}
