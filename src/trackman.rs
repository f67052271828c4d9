pub mod aggregate;
pub mod columns;
pub mod leaderboard;
pub mod output;
pub mod profile;
pub mod record;
pub mod stats;
