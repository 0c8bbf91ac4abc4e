use alloc::vec::Vec;

/// Handle to a reusable row container owned by a [`RowSlotPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotId(u32);

impl SlotId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A row container. It has no entity identity; it only remembers what it was last told to show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    leased: bool,
    /// Visibility flag seen by the renderer.
    pub visible: bool,
    /// Roster index currently bound to the slot.
    pub binding: Option<usize>,
    pub offset: f32,
    pub opacity: f32,
}

impl Slot {
    fn inactive() -> Self {
        Self {
            leased: false,
            visible: false,
            binding: None,
            offset: 0.0,
            opacity: 1.0,
        }
    }

    /// Whether the slot is currently handed out by its pool.
    pub fn is_leased(&self) -> bool {
        self.leased
    }
}

/// A pool of row slots with a soft capacity.
///
/// `acquire` prefers the most recently released slot and only creates a new one when every
/// existing slot is handed out. A slot is never handed out twice before it is released.
#[derive(Clone, Debug, Default)]
pub struct RowSlotPool {
    slots: Vec<Slot>,
    free: Vec<SlotId>,
    capacity: usize,
}

impl RowSlotPool {
    /// Creates a pool with `prewarm` inactive slots ready to be acquired.
    pub fn new(prewarm: usize) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(prewarm),
            free: Vec::with_capacity(prewarm),
            capacity: prewarm,
        };
        for _ in 0..prewarm {
            let id = pool.create();
            pool.free.push(id);
        }
        // Acquire pops from the back; keep the lowest id on top so slots come out in order.
        pool.free.reverse();
        pool
    }

    fn create(&mut self) -> SlotId {
        let raw = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot::inactive());
        SlotId(raw)
    }

    /// Hands out an inactive slot and marks it active.
    pub fn acquire(&mut self) -> SlotId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                let id = self.create();
                pdebug!(
                    slot = id.index(),
                    capacity = self.capacity,
                    "RowSlotPool::acquire: growing past prewarmed capacity"
                );
                id
            }
        };
        if let Some(slot) = self.slots.get_mut(id.index()) {
            *slot = Slot::inactive();
            slot.leased = true;
            slot.visible = true;
        }
        id
    }

    /// Deactivates a slot and returns it to the pool.
    ///
    /// Returns `false` (and changes nothing) if the slot is unknown or already released.
    pub fn release(&mut self, id: SlotId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            pwarn!(slot = id.index(), "RowSlotPool::release: unknown slot");
            return false;
        };
        if !slot.leased {
            pwarn!(slot = id.index(), "RowSlotPool::release: slot already released");
            return false;
        }
        *slot = Slot::inactive();
        self.free.push(id);
        true
    }

    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.index())
    }

    /// Mutable access for the owner of a handed-out slot.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots.get_mut(id.index())
    }

    pub fn is_leased(&self, id: SlotId) -> bool {
        self.get(id).is_some_and(Slot::is_leased)
    }

    /// Prewarmed size of the pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots ever created.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn in_use(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}
