fn main() -> anyhow::Result<()> {
    msbt::cli::run_cli()
}
