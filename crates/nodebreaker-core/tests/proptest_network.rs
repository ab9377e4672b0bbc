//! Property-based tests for network generation.
//!
//! Uses proptest to generate random lattice configurations and seeds, then
//! verify the structural invariants: connectivity of the non-breakable
//! subgraph, edge symmetry, degree bounds, and assignment counts.

use nodebreaker_core::config::GameConfig;
use nodebreaker_core::lattice::GridPos;
use nodebreaker_core::network::NodeNetwork;
use nodebreaker_core::rng::SimRng;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// Random configurations that are always satisfiable: breakable count is
/// capped around a third of the lattice so the retry loop converges fast.
fn arb_config() -> impl Strategy<Value = GameConfig> {
    (2u32..=4).prop_flat_map(|size| {
        let nodes = size.pow(3);
        (Just(size), 0..=nodes / 3, 0..=2u32).prop_map(|(size, breakable, breakers)| GameConfig {
            size,
            breakable_count: breakable,
            breaker_count: breakers,
            ..Default::default()
        })
    })
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The induced non-breakable subgraph is connected for every generated
    /// network, across random configs and seeds.
    #[test]
    fn non_breakable_subgraph_is_connected(
        config in arb_config(),
        seed in any::<u64>(),
    ) {
        let mut rng = SimRng::new(seed);
        let network = NodeNetwork::generate(&config, &mut rng).unwrap();
        prop_assert!(network.non_breakable_connected());
    }

    /// Exactly the configured number of special nodes, and breakers are
    /// drawn strictly from the non-breakable pool.
    #[test]
    fn assignment_counts_match_config(
        config in arb_config(),
        seed in any::<u64>(),
    ) {
        let mut rng = SimRng::new(seed);
        let network = NodeNetwork::generate(&config, &mut rng).unwrap();

        let breakable = network.iter().filter(|(_, n)| n.flags.breakable).count();
        let breakers = network.iter().filter(|(_, n)| n.flags.breaker).count();
        prop_assert_eq!(breakable as u32, config.breakable_count);
        prop_assert_eq!(breakers as u32, config.breaker_count);

        for (_, node) in network.iter() {
            prop_assert!(!(node.flags.breakable && node.flags.breaker));
        }
    }

    /// Edge symmetry and the von Neumann degree bound: if A neighbors B then
    /// B neighbors A, and nobody has more than 6 neighbors.
    #[test]
    fn edges_are_symmetric_with_bounded_degree(
        config in arb_config(),
        seed in any::<u64>(),
    ) {
        let mut rng = SimRng::new(seed);
        let network = NodeNetwork::generate(&config, &mut rng).unwrap();

        for (id, _) in network.iter() {
            let neighbors = network.neighbors(id);
            prop_assert!(neighbors.len() <= 6);

            let mut unique = neighbors.to_vec();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), neighbors.len(), "no duplicate edges");

            for &neighbor in neighbors {
                prop_assert!(network.neighbors(neighbor).contains(&id));
            }
        }
    }

    /// Every lattice coordinate resolves to a node whose grid position
    /// round-trips.
    #[test]
    fn position_lookup_round_trips(
        config in arb_config(),
        seed in any::<u64>(),
    ) {
        let mut rng = SimRng::new(seed);
        let network = NodeNetwork::generate(&config, &mut rng).unwrap();

        let size = config.size as i32;
        for x in 0..size {
            for y in 0..size {
                for z in 0..size {
                    let pos = GridPos::new(x, y, z);
                    let id = network.node_at(pos).unwrap();
                    prop_assert_eq!(network.node(id).unwrap().grid, pos);
                }
            }
        }
    }

    /// Neighbors are exactly the in-bounds positions one step along an axis.
    #[test]
    fn neighbors_are_axis_adjacent(
        config in arb_config(),
        seed in any::<u64>(),
    ) {
        let mut rng = SimRng::new(seed);
        let network = NodeNetwork::generate(&config, &mut rng).unwrap();

        for (id, node) in network.iter() {
            for &neighbor in network.neighbors(id) {
                let other = network.node(neighbor).unwrap().grid;
                let d = (node.grid.x - other.x).abs()
                    + (node.grid.y - other.y).abs()
                    + (node.grid.z - other.z).abs();
                prop_assert_eq!(d, 1, "neighbors differ by one along one axis");
            }
        }
    }
}
