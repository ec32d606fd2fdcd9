use anyhow::Result;

use motive_core::MotionCurve;

pub fn run() -> Result<()> {
    print!("{:<14}", "t");
    for i in 0..=10 {
        print!("{:>6.1}", i as f32 / 10.0);
    }
    println!();

    for curve in MotionCurve::ALL {
        print!("{:<14}", format!("{curve:?}"));
        for i in 0..=10 {
            print!("{:>6.2}", curve.apply(i as f32 / 10.0));
        }
        println!();
    }

    Ok(())
}
