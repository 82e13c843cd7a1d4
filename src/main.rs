use clap::Parser;

use dealsum::prelude::*;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing();

    CliApp::new("dealsum")
        .run(|writer| async move {
            let config = RunConfig::from_args(args)?;
            execute(&config, writer).await?;
            Ok(())
        })
        .await
}
