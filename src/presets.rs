//! The reference three-place walk.
//!
//! A kitten wanders between home, the park and school. From school it most
//! likely heads home; from home it most likely goes to the park.

use crate::builder::SimulationBuilder;
use crate::state_enum;

state_enum! {
    /// Places the walker can be.
    pub enum Place {
        Home,
        Park,
        School,
    }
}

/// Starting weights, one row per place in [`Place::ALL`] order.
pub const VILLAGE_WEIGHTS: [[i64; 3]; 3] = [[30, 50, 20], [40, 30, 30], [60, 30, 10]];

/// Builder for the reference walk, starting at home.
///
/// Callers can still override the configuration or the draw source before
/// building.
///
/// ```
/// use markov_walk::presets::{village_walk, Place};
///
/// let simulation = village_walk().build().unwrap();
/// assert_eq!(simulation.current_state(), Place::Home);
/// assert_eq!(simulation.row_sum(&Place::School), Ok(100));
/// ```
pub fn village_walk() -> SimulationBuilder<Place> {
    Place::ALL.iter().zip(VILLAGE_WEIGHTS).fold(
        SimulationBuilder::new()
            .states(Place::ALL.iter().copied())
            .initial(Place::Home),
        |builder, (from, row)| builder.row(*from, Place::ALL.iter().copied().zip(row)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;

    #[test]
    fn places_are_named() {
        let names: Vec<&str> = Place::ALL.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Home", "Park", "School"]);
    }

    #[test]
    fn village_rows_are_well_formed() {
        let simulation = village_walk().build().unwrap();
        assert!(simulation.matrix().misconfigured_rows().is_empty());
        assert_eq!(simulation.weight(&Place::Home, &Place::Park), Ok(50));
        assert_eq!(simulation.weight(&Place::Park, &Place::School), Ok(30));
        assert_eq!(simulation.weight(&Place::School, &Place::Home), Ok(60));
    }

    #[test]
    fn village_starts_at_home() {
        let snapshot = village_walk().build().unwrap().snapshot();
        assert_eq!(snapshot.current, Place::Home);
        assert_eq!(snapshot.history.to_vec(), vec![Place::Home]);
        assert_eq!(snapshot.visits.as_slice(), &[1, 0, 0]);
        assert_eq!(snapshot.last_roll, None);
    }
}
