use coffee_scene::SceneConfig;

fn main() -> anyhow::Result<()> {
    coffee_scene::run(SceneConfig::default())
}
