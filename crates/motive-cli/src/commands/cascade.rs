use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;

use motive_core::util::random_color;
use motive_core::{
    Color, MotionConfig, MotionDuration, MotionEngine, MotionPlayer, MotionScaleFactor,
    MotionTarget, MotionValue, MotionValueMap, Phases, Stagger,
};

use crate::console::ConsoleTarget;

pub async fn run(count: usize, stagger: Stagger) -> Result<()> {
    let config = MotionConfig::load()?;
    let engine = MotionEngine::from_config(&config);
    let duration = MotionDuration::Medium02;
    let scale = MotionScaleFactor::CascadeNormal.factor();

    println!(
        "Cascading {} items, {}ms apart...",
        count,
        stagger.delay_millis()
    );

    let targets: Vec<Arc<ConsoleTarget>> = (0..count)
        .map(|i| Arc::new(ConsoleTarget::new(format!("item-{i}"))))
        .collect();

    // The engine holds targets weakly, so keep them alive for the demo.
    let handles: Vec<Arc<dyn MotionTarget>> = targets
        .iter()
        .map(|t| Arc::clone(t) as Arc<dyn MotionTarget>)
        .collect();

    for handle in &handles {
        // Each item fades between random fill gradients while it moves.
        let hidden = Color::new(0.0, 0.0, 0.0, 0.0);
        let values = MotionValueMap::new()
            .with(MotionValue::Alpha(Phases::new(0.0, 1.0, 0.0)))
            .with(MotionValue::Scale(Phases::new(scale, 1.0, scale)))
            .with(MotionValue::TranslationY(Phases::new(24.0, 0.0, -24.0)))
            .with(MotionValue::ColorGradient {
                enter: vec![hidden, hidden],
                settled: vec![random_color(), random_color()],
                exit: vec![hidden, hidden],
            });
        MotionPlayer::builder(Arc::downgrade(handle))
            .values(values)
            .duration(duration)
            .chain("cascade", Duration::from_millis(stagger.delay_millis()))
            .build(&engine);
    }

    let total = stagger.delay_millis() * count as u64 + duration.millis() + 100;

    engine.play_enter_chain_for_key("cascade", false);
    sleep(Duration::from_millis(total)).await;

    for target in &targets {
        let state = target.snapshot();
        let fill = state
            .gradient
            .first()
            .map(|c| format!("#{:02x}{:02x}{:02x}", to_byte(c.red), to_byte(c.green), to_byte(c.blue)))
            .unwrap_or_else(|| "none".to_string());
        println!(
            "  {}: alpha={:.2} scale={:.2} ty={:.1} fill={}",
            target.label(),
            state.alpha,
            state.scale_x,
            state.translation_y,
            fill
        );
    }

    println!("Cascading out...");
    engine.play_exit_chain_for_key("cascade", true);
    sleep(Duration::from_millis(total)).await;

    for target in &targets {
        println!("  {}: alpha={:.2}", target.label(), target.snapshot().alpha);
    }
    println!("Chain cleared: {}", !engine.has_chain("cascade"));

    Ok(())
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
