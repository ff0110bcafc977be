/// Explicit state snapshot capability.
///
/// A type implements this trait only when saving and later restoring its
/// internal state is meaningful and safe. Generic code that wants to rewind
/// a primitive requires `T: SavedState` at the call site, so the capability
/// is checked at compile time rather than discovered at runtime.
///
/// Saved states may contain secret material. They are wiped when dropped,
/// and [`SavedState::clean_saved_state`] wipes one explicitly.
pub trait SavedState {
    /// Opaque snapshot type.
    type State;

    /// Captures the current state.
    fn save_state(&self) -> Self::State;

    /// Replaces the current state with a snapshot taken from an object
    /// built with the same key.
    fn restore_state(&mut self, saved: &Self::State) -> &mut Self;

    /// Wipes a snapshot that is no longer needed.
    fn clean_saved_state(saved: &mut Self::State);
}
