use bitflags::bitflags;

bitflags! {
    /// Set of capability tags an entity declares, or a pinpointer searches for.
    ///
    /// The named flags cover the trackable kinds the bundled content uses.
    /// Games with their own tags can use any other bit through
    /// [`CapabilitySet::from_bits_retain`].
    ///
    /// A pinpointer matches an entity when the two sets intersect.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct CapabilitySet: u64 {
        const NUCLEAR_DISK    = 1 << 0;
        const DISTRESS_BEACON = 1 << 1;
        const STATION_BEACON  = 1 << 2;
        const SUIT_SENSOR     = 1 << 3;
        const ANOMALY         = 1 << 4;
        const BLACK_BOX       = 1 << 5;
        const SYNDICATE_ITEM  = 1 << 6;
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CapabilitySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        bitflags::serde::serialize(self, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CapabilitySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        bitflags::serde::deserialize(deserializer)
    }
}

impl CapabilitySet {
    /// Returns true if an entity with `declared` capabilities satisfies this search set.
    #[inline]
    pub fn matches(self, declared: CapabilitySet) -> bool {
        self.intersects(declared)
    }
}
