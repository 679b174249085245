use bitflags::bitflags;

bitflags! {
    /// Tracks which replicated fields of a [`PinpointerDevice`] changed during
    /// an operation.
    ///
    /// Each bit maps to one field of [`PinpointerSnapshot`]; fields that are
    /// local configuration have no bit. An empty mask means nothing needs to
    /// be replicated or redrawn.
    ///
    /// [`PinpointerDevice`]: super::PinpointerDevice
    /// [`PinpointerSnapshot`]: super::PinpointerSnapshot
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct DeviceFields: u8 {
        const STORED_TARGETS = 1 << 0;
        const TARGET         = 1 << 1;
        const TARGET_NAME    = 1 << 2;
        const CAN_RETARGET   = 1 << 3;
        const ARROW_ANGLE    = 1 << 4;
        const DISTANCE_BAND  = 1 << 5;
        const IS_ACTIVE      = 1 << 6;
    }
}

impl DeviceFields {
    /// Fields a presentation layer needs to redraw the indicator.
    pub const INDICATOR: Self = Self::ARROW_ANGLE
        .union(Self::DISTANCE_BAND)
        .union(Self::IS_ACTIVE);
}
