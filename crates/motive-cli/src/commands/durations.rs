use anyhow::Result;

use motive_core::MotionDuration;

pub fn run() -> Result<()> {
    println!("{:<28}{:>8}", "token", "millis");
    for token in MotionDuration::ALL {
        println!("{:<28}{:>8}", format!("{token:?}"), token.millis());
    }
    Ok(())
}
