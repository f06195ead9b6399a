/// Status value for active rows (users, mappings, goals, answers).
pub const STATUS_ACTIVE: i32 = 1;

/// Status value for closed / inactive rows.
pub const STATUS_INACTIVE: i32 = 0;

/// Role assigned to every self-registered app user.
pub const ROLE_APP_USER: i32 = 2;

/// Textual timestamp layout used for every created/updated column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Calendar date layout for goal months and subscription expiry.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the pairing code handed out at registration.
pub const UNIQUE_CODE_LENGTH: usize = 4;

/// Attempts made to find a free pairing code before giving up.
pub const UNIQUE_CODE_MAX_ATTEMPTS: usize = 64;

/// Sum that the two percentages of a goal pair always add up to.
pub const PAIR_PERCENTAGE_TOTAL: i32 = 100;
