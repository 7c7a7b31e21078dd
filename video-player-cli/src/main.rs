use std::process;

mod cli;

#[tokio::main]
async fn main() {
    match cli::run().await {
        Ok(()) => {}
        Err(err) => {
            println!("{err}");
            process::exit(1);
        }
    }
}
