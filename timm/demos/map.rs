//! Walks through a few allocations, displaying the map of the heap along the way.

use timm::{MappedRegion, TimmAllocator};

type Allocator = TimmAllocator<2048>;

fn print_map(allocator: &Allocator, title: &str) {
    let map = allocator.with_heap(|heap| heap.map().to_string()).expect("Initialized");

    println!("{}", title);
    println!("{}", map);
    println!(
        "Blocks: {}, free: {}",
        allocator.block_count().expect("Initialized"),
        allocator.free_block_count().expect("Initialized"),
    );
    println!();
}

fn main() {
    let region = MappedRegion::new(4096).expect("Mapped");

    //  Declared after `region`, hence dropped before it is unmapped.
    let allocator = Allocator::new();

    if let Err(error) = allocator.init(region.as_ptr(), region.len(), 512) {
        eprintln!("Cannot initialize the allocator: {}", error);
        std::process::exit(1);
    }

    print_map(&allocator, "Initial state");

    let first = allocator.allocate(12).expect("first");
    let second = allocator.allocate(16).expect("second");

    print_map(&allocator, "After allocating 12 and 16 bytes");

    unsafe { allocator.deallocate(first, 12) };

    let third = allocator.allocate(40).expect("third");

    print_map(&allocator, "After deallocating 12 bytes, then allocating 40 bytes");

    unsafe {
        allocator.deallocate(second, 16);
        allocator.deallocate(third, 40);
    }

    print_map(&allocator, "After deallocating everything");
}
