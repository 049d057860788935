use park_scene::{
    flow,
    park::{Park, config::ParkConfig},
};

fn main() -> anyhow::Result<()> {
    flow::run(vec![Park::constructor(ParkConfig::default())])
}
