/// Heuristic tuning weights for the region analyzer, the move evaluator, and
/// the decision pipeline.
///
/// The defaults are the engine's literal tuning constants (including the
/// left-half bias, which is deliberate but somewhat arbitrary); they are kept
/// in one struct so experiments can vary them without touching the scoring
/// code.
#[derive(Clone, Copy, Debug)]
pub struct Weights {
    // Region analysis.
    /// Flat potential bonus for a region at least 2 cells away from every board edge.
    pub region_interior_bonus: f64,
    /// Potential bonus per cell of area for a region in the board's left half.
    pub region_left_area_factor: f64,
    /// Weight of expansion potential in the region sort key.
    pub region_potential_weight: f64,
    /// Step bonuses for region areas of at least 9 / 16 / 25 cells.
    pub region_area_steps: [f64; 3],

    // First-move evaluation.
    /// Cap of the proximity-to-center bonus.
    pub first_center_max: f64,
    /// Per-cell piece size factor for the first move.
    pub first_size_factor: f64,
    /// Quadrant-diversity factor for the first move.
    pub first_diversity_factor: f64,

    // General move evaluation.
    /// Per-cell piece size factor.
    pub size_factor: f64,
    /// Competition weight before 40% / before 70% / after 70% progress.
    pub competition_weights: [f64; 3],
    /// Flat bonus when over 60% of occupied cells are high-competition.
    pub contested_bonus: f64,
    /// Monomino penalty in low-competition spots, and bonus in high ones.
    pub mono_low_penalty: f64,
    pub mono_high_bonus: f64,
    /// Quadrant-diversity weight before / after 50% progress.
    pub diversity_weights: [f64; 2],
    /// Cap of the early-game edge-proximity penalty.
    pub edge_penalty_max: f64,
    /// Flat bonus per opponent connection point the placement occupies.
    pub block_bonus: f64,

    // Defensive evaluation.
    /// Per-connection-point factor in the defensive score.
    pub defensive_block_factor: f64,
    /// Minimum defensive score that overrides the normal search.
    pub defensive_threshold: f64,
    /// Higher bar a monomino must clear to be spent defensively early.
    pub defensive_mono_threshold: f64,

    // Region-guided search.
    /// Cap and flat part of the expansion-potential bonus.
    pub search_expansion_cap: f64,
    pub search_expansion_flat: f64,
    /// Factor on log2(piece size).
    pub search_size_log_factor: f64,
    /// Bonus for a left-half region when the left half is markedly emptier.
    pub search_left_bonus: f64,
    /// Empty-cell ratio (left over right) that counts as markedly emptier.
    pub search_left_ratio: f64,
    /// Near-perfect fit bonus in small regions.
    pub search_fit_bonus: f64,
    /// Monomino penalties before 70% progress: in a 1-cell region, and elsewhere.
    pub search_mono_single_penalty: f64,
    pub search_mono_penalty: f64,
    /// Chance to still try a monomino in a region where it is normally skipped.
    pub search_mono_retry_chance: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            region_interior_bonus: 5.0,
            region_left_area_factor: 0.5,
            region_potential_weight: 2.0,
            region_area_steps: [10.0, 15.0, 20.0],

            first_center_max: 20.0,
            first_size_factor: 3.0,
            first_diversity_factor: 5.0,

            size_factor: 2.0,
            competition_weights: [3.0, 2.0, 1.0],
            contested_bonus: 10.0,
            mono_low_penalty: 15.0,
            mono_high_bonus: 20.0,
            diversity_weights: [5.0, 3.0],
            edge_penalty_max: 10.0,
            block_bonus: 15.0,

            defensive_block_factor: 25.0,
            defensive_threshold: 50.0,
            defensive_mono_threshold: 80.0,

            search_expansion_cap: 30.0,
            search_expansion_flat: 20.0,
            search_size_log_factor: 8.0,
            search_left_bonus: 15.0,
            search_left_ratio: 1.5,
            search_fit_bonus: 50.0,
            search_mono_single_penalty: 10.0,
            search_mono_penalty: 30.0,
            search_mono_retry_chance: 0.1,
        }
    }
}
