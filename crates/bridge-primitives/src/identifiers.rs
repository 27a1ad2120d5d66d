/// Index of a validator slot; always below the genesis slot count.
pub type SlotId = u16;
