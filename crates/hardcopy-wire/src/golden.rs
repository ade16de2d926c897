//! Golden vector tests for the paper-backup wire format.
//!
//! These pin the exact unit strings so any change to the framing shows up
//! as a test diff, not a silently incompatible backup.
