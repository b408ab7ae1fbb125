use framelink::{
    AlwaysUp, ComsEngine, EchoHandler, LinkConfig, LinkController, ManagementHandler,
    NoopHandler, UdpTransport, DEFAULT_FRAME_SIZE,
};

#[tokio::main]
async fn main() -> framelink::Result<()> {
    tracing_subscriber::fmt::init();

    let config = LinkConfig::default();
    let transport = UdpTransport::<DEFAULT_FRAME_SIZE>::bind(&config.udp)?;
    println!("Listening on {}", transport.local_addr()?);

    // Handler 2 comes back whenever the host sends AddEnsuredPackets
    let management = ManagementHandler::new().ensure(|| Box::new(NoopHandler::new(2, true)));
    let mut engine = ComsEngine::with_management(transport, Some(management))?;
    engine.add_packet(EchoHandler::new(3, false))?;

    println!("Registered handlers: {:?}", engine.packet_ids());
    println!("Press Ctrl-C to stop");

    let mut controller = LinkController::new(engine, AlwaysUp, config)?;
    controller
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    let stats = controller.engine().stats();
    println!("\nFrames received: {}", stats.frames_received);
    println!("Frames sent: {}", stats.frames_sent);
    println!("Retransmissions suppressed: {}", stats.retransmissions);
    println!("Unknown ids: {}", stats.unknown_ids);

    Ok(())
}
