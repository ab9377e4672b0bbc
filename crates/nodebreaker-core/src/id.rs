use slotmap::new_key_type;

new_key_type! {
    /// Identifies a node in the lattice network.
    ///
    /// Nodes live in a `SlotMap` arena; every side table (adjacency inside
    /// the core, mesh handles in the presentation layer) is a `SecondaryMap`
    /// keyed by this type. Keys stay valid for the lifetime of a session --
    /// "removing" a node from play flips flags, it never frees the slot.
    pub struct NodeId;
}
