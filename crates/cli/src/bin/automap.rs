use anyhow::Result;

fn main() -> Result<()> {
    automap_cli::main_entry()
}
