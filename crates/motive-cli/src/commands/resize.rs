use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval, sleep};

use motive_core::{
    MotionConfig, MotionCurve, MotionDuration, MotionEngine, MotionPlayer, MotionTarget,
    MotionValue, MotionValueMap, Phases,
};

use crate::console::ConsoleTarget;

pub async fn run() -> Result<()> {
    let config = MotionConfig::load()?;
    let engine = MotionEngine::from_config(&config);

    let target = Arc::new(ConsoleTarget::new("sheet"));
    let handle: Arc<dyn MotionTarget> = Arc::clone(&target) as Arc<dyn MotionTarget>;

    let player = MotionPlayer::builder(Arc::downgrade(&handle))
        .values(MotionValueMap::new().with(MotionValue::Resize {
            width: Phases::new(0.0, 60.0, 0.0),
            height: Phases::new(0.0, 12.0, 0.0),
        }))
        .duration(MotionDuration::Long02)
        .curve_enter(MotionCurve::Ease02)
        .build(&engine);

    println!("Growing layout to 60x12...");
    player.enter(false)?;

    // Sample the layout while the animation mutates it.
    let mut ticker = interval(Duration::from_millis(100));
    for _ in 0..5 {
        ticker.tick().await;
        let state = target.snapshot();
        let bar = "#".repeat(state.width.round() as usize);
        println!("  {:>5.1} x {:>4.1} |{}", state.width, state.height, bar);
    }

    sleep(Duration::from_millis(MotionDuration::Long02.millis())).await;
    let state = target.snapshot();
    println!("Settled at {:.0}x{:.0}", state.width, state.height);

    Ok(())
}
