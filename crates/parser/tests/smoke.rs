#![allow(unused_crate_dependencies)]

use std::sync::Barrier;

use yamlbind_grammar::obtain_handle;
use yamlbind_parser::{ParserFactory, bind, verify_shipped};

#[test]
fn can_load_grammar() {
	let handle = obtain_handle().expect("Error loading YAML grammar");
	bind(&handle).expect("Error loading YAML grammar");
}

#[test]
fn bind_is_repeatable() {
	for _ in 0..32 {
		let handle = obtain_handle().unwrap();
		let mut parser = bind(&handle).unwrap();
		assert_eq!(parser.parse("k: v\n").unwrap().root_node().kind(), "stream");
	}
}

#[test]
fn harness_parses_document() {
	let mut parser = verify_shipped().expect("grammar failed to load");
	let tree = parser
		.parse("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: demo\ndata:\n  key: \"value\"\n")
		.unwrap();

	assert_eq!(tree.root_node().kind(), "stream");
	assert!(!tree.root_node().has_error());
}

#[test]
fn concurrent_binds_share_one_handle() {
	const THREADS: usize = 16;

	let factory = ParserFactory::new();
	let barrier = Barrier::new(THREADS);
	let grammars: Vec<_> = std::thread::scope(|scope| {
		let workers: Vec<_> = (0..THREADS)
			.map(|_| {
				scope.spawn(|| {
					barrier.wait();
					let handle = obtain_handle().unwrap();
					let mut parser = factory.bind(&handle).unwrap();
					assert!(parser.parse("- item\n").is_some());
					parser.grammar().clone()
				})
			})
			.collect();
		workers.into_iter().map(|w| w.join().unwrap()).collect()
	});

	assert!(grammars.iter().all(|g| g.same_grammar(&grammars[0])));
}
