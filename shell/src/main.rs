fn main() -> anyhow::Result<()> {
  setlist_lib::run()
}
