use ordered_multi::{Error, OrderedMultiset};

fn three_five_seven() -> OrderedMultiset<i32> {
	let mut set = OrderedMultiset::new();
	set.insert(5);
	set.insert(3);
	set.insert(7);
	set.insert(3);
	set
}

#[test]
fn floor() {
	let set = three_five_seven();

	assert_eq!(set.floor(&4), Ok(&3));
	assert_eq!(set.floor(&5), Ok(&5));
	assert_eq!(set.floor(&6), Ok(&5));
	assert_eq!(set.floor(&7), Ok(&7));
	assert_eq!(set.floor(&100), Ok(&7));
	assert_eq!(set.floor(&2), Err(Error::NoFloorExists));
}

#[test]
fn ceil() {
	let set = three_five_seven();

	assert_eq!(set.ceil(&4), Ok(&5));
	assert_eq!(set.ceil(&5), Ok(&5));
	assert_eq!(set.ceil(&6), Ok(&7));
	assert_eq!(set.ceil(&7), Ok(&7));
	assert_eq!(set.ceil(&-100), Ok(&3));
	assert_eq!(set.ceil(&8), Err(Error::NoCeilExists));
}

#[test]
fn empty_bounds() {
	let set: OrderedMultiset<i32> = OrderedMultiset::new();

	assert_eq!(set.floor(&1), Err(Error::EmptyContainer));
	assert_eq!(set.ceil(&1), Err(Error::EmptyContainer));
	assert_eq!(set.min(), Err(Error::EmptyContainer));
	assert_eq!(set.max(), Err(Error::EmptyContainer));
}

#[test]
fn bounds_follow_removals() {
	let mut set = three_five_seven();

	set.remove(&5).unwrap();
	assert_eq!(set.floor(&6), Ok(&3));
	assert_eq!(set.ceil(&4), Ok(&7));

	// 3 still occurs once.
	set.remove(&3).unwrap();
	assert_eq!(set.floor(&4), Ok(&3));
	set.remove(&3).unwrap();
	assert_eq!(set.floor(&4), Err(Error::NoFloorExists));
	assert_eq!(set.min(), Ok(&7));
	set.validate().unwrap();
}

#[test]
fn bounds_match_sorted_scan() {
	let keys = [50, 20, 80, 10, 30, 70, 90, 25, 35, 75, 20, 80];
	let mut set = OrderedMultiset::new();
	for k in keys {
		set.insert(k);
	}

	for q in 0..100 {
		let floor = keys.iter().filter(|k| **k <= q).max();
		let ceil = keys.iter().filter(|k| **k >= q).min();
		assert_eq!(set.floor(&q).ok(), floor);
		assert_eq!(set.ceil(&q).ok(), ceil);
	}
}
