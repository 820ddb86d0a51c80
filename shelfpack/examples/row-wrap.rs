use shelfpack::{InputItem, ShelfPacker};

fn main() {
    env_logger::init();

    let inputs: Vec<_> = (0..5).map(|_| InputItem::new((100, 64))).collect();

    let packer = ShelfPacker::new().max_width(256);
    let result = packer.pack(inputs);

    println!("Pack result: {:#?}", result);
}
