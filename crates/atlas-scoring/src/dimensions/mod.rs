//! One module per similarity axis.

pub mod categorical;
pub mod frequency;
pub mod geography;
pub mod joint_activity;
pub mod magnitude;
