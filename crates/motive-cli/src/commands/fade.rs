use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;

use motive_core::{
    MotionConfig, MotionCurve, MotionDuration, MotionEngine, MotionTarget, MotionValue,
    MotionValueMap, MotionViewBase, Phases,
};

use crate::console::ConsoleTarget;

pub async fn run() -> Result<()> {
    let config = MotionConfig::load()?;
    let engine = MotionEngine::from_config(&config);

    let target = Arc::new(ConsoleTarget::new("panel"));
    let handle: Arc<dyn MotionTarget> = Arc::clone(&target) as Arc<dyn MotionTarget>;

    let view = MotionViewBase::new(
        Arc::downgrade(&handle),
        MotionValueMap::new().with(MotionValue::Alpha(Phases::new(0.0, 1.0, 0.0))),
    )
    .duration(MotionDuration::Medium03)
    .curve_enter(MotionCurve::Decelerate02)
    .curve_exit(MotionCurve::Accelerate02)
    .announcements(
        Some("panel appearing".to_string()),
        Some("panel shown".to_string()),
        Some("panel hidden".to_string()),
    );
    let player = engine.init_player(&view);

    println!("Fading in...");
    player.enter(false)?;
    sleep(Duration::from_millis(MotionDuration::Medium03.millis() + 100)).await;
    println!("  alpha={:.2}", target.snapshot().alpha);

    println!("Fading out...");
    player.exit()?;
    sleep(Duration::from_millis(MotionDuration::Medium03.millis() + 100)).await;
    println!("  alpha={:.2}", target.snapshot().alpha);

    for text in target.snapshot().announcements {
        println!("  announced: {text}");
    }

    Ok(())
}
