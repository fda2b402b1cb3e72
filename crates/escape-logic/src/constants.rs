//! Tuning constants: interaction ranges, motion rates, outline defaults,
//! scene indices and prompt texts.
//!
//! These are the reference values every level config falls back to when a
//! field is omitted.

/// Proximity thresholds in world units.
pub mod ranges {
    /// Collectibles (keys, fuses, plain items).
    pub const PICKUP: f32 = 2.5;
    /// Doors.
    pub const DOOR: f32 = 2.5;
    pub const FUSEBOX: f32 = 2.5;
    pub const LEVER: f32 = 2.5;
    /// The escape vehicle.
    pub const ESCAPE: f32 = 3.0;
}

/// Rotation tuning shared by doors, levers and gates.
pub mod motion {
    /// Degrees a door or gate swings around its vertical axis.
    pub const OPEN_ANGLE_DEG: f32 = 90.0;
    /// Degrees a lever tips forward when pulled.
    pub const LEVER_ANGLE_DEG: f32 = 90.0;
    /// Interpolation rate (per second) for slerp-driven motion.
    pub const SMOOTH_RATE: f32 = 2.0;
    /// Angular distance (degrees) under which a moving part snaps to its target.
    pub const ARRIVAL_EPSILON_DEG: f32 = 0.1;
}

/// Outline detection and styling.
pub mod outline {
    /// Maximum sphere-cast distance from the viewer.
    pub const RAY_LENGTH: f32 = 100.0;
    /// Sphere-cast thickness.
    pub const SPHERECAST_RADIUS: f32 = 1.0;
    pub const DEFAULT_WIDTH: f32 = 2.0;
    pub const MAX_WIDTH: f32 = 10.0;
    /// Straight white, RGBA.
    pub const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Render pass names appended to a highlighted target's material list.
    pub const MASK_PASS: &str = "OutlineMask (Instance)";
    pub const FILL_PASS: &str = "OutlineFill (Instance)";
}

/// Build indices of the game's scenes.
pub mod scenes {
    /// Level loaded by the timed intro switch.
    pub const GAME: u32 = 2;
    /// Level loaded by the end-game trigger.
    pub const END: u32 = 3;
    /// Frames the intro runs before switching to [`GAME`].
    pub const INTRO_FRAMES: u32 = 3500;
    /// Seconds the transition animation plays before a load.
    pub const TRANSITION_DELAY_SECS: f32 = 1.0;
}

/// On-screen prompt texts.
pub mod prompts {
    pub const PICK_UP: &str = "Press 'E' to pick up";
    pub const NEED_FUSE: &str = "I need to find a fuse...";
    pub const PLACE_FUSE: &str = "Press P to place fuse";
    pub const PULL_LEVER: &str = "Press P to pull the lever";
    /// The lever shows an empty prompt until its fusebox is live.
    pub const LEVER_NO_FUSE: &str = "";
    pub const ESCAPE: &str = "Press E to escape!";
}
