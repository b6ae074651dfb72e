fn main() -> anyhow::Result<()> {
    picnote::run()?;
    Ok(())
}
