//! Widget handles.
//!
//! A [`WidgetId`] is the opaque handle of exactly one native widget owned by a
//! backend. Handles are arena keys: they stay valid while the native widget
//! exists and never alias a different widget after it is destroyed.

use slotmap::new_key_type;

new_key_type! {
    /// A unique identifier for a native widget.
    ///
    /// `WidgetId`s are stable handles that remain valid even as the widget tree
    /// changes. They become invalid when the owning backend wrapper is dropped.
    pub struct WidgetId;
}

impl WidgetId {
    /// Convert the WidgetId to a raw u64 value.
    ///
    /// This is useful for interop with external systems that need a numeric ID.
    /// The raw value can be converted back using [`WidgetId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create a WidgetId from a raw u64 value.
    ///
    /// Note: This does not check that the widget still exists.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_raw_id_survives_interop() {
        let mut arena: SlotMap<WidgetId, &str> = SlotMap::with_key();
        let id = arena.insert("slider");

        let restored = WidgetId::from_raw(id.as_raw());
        assert_eq!(restored, id);
        assert_eq!(arena.get(restored), Some(&"slider"));
    }

    #[test]
    fn test_removed_id_does_not_alias() {
        let mut arena: SlotMap<WidgetId, u32> = SlotMap::with_key();
        let first = arena.insert(1);
        arena.remove(first);
        let second = arena.insert(2);

        assert_ne!(first, second);
        assert!(arena.get(first).is_none());
    }
}
