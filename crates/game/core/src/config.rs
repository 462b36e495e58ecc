/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Cards dealt to the hand at the start of each player turn.
    pub hand_size: usize,

    /// Energy the player refills to at the start of each turn.
    pub base_energy: u32,

    /// Room cards offered per draw on the dungeon deck.
    pub room_choices: usize,

    /// Player health at the start of a fresh run.
    pub starting_health: u32,
}

impl GameConfig {
    // ===== template deck composition =====
    pub const TEMPLATE_COMBAT_ROOMS: usize = 7;
    pub const TEMPLATE_ELITE_ROOMS: usize = 2;
    pub const TEMPLATE_CAMPFIRE_ROOMS: usize = 2;
    pub const TEMPLATE_TREASURE_ROOMS: usize = 2;
    pub const TEMPLATE_BOSS_ROOMS: usize = 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HAND_SIZE: usize = 5;
    pub const DEFAULT_BASE_ENERGY: u32 = 3;
    pub const DEFAULT_ROOM_CHOICES: usize = 3;
    pub const DEFAULT_STARTING_HEALTH: u32 = 60;

    pub fn new() -> Self {
        Self {
            hand_size: Self::DEFAULT_HAND_SIZE,
            base_energy: Self::DEFAULT_BASE_ENERGY,
            room_choices: Self::DEFAULT_ROOM_CHOICES,
            starting_health: Self::DEFAULT_STARTING_HEALTH,
        }
    }

    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    pub fn with_base_energy(mut self, base_energy: u32) -> Self {
        self.base_energy = base_energy;
        self
    }

    pub fn with_room_choices(mut self, room_choices: usize) -> Self {
        self.room_choices = room_choices;
        self
    }

    pub fn with_starting_health(mut self, starting_health: u32) -> Self {
        self.starting_health = starting_health;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
