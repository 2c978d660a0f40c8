use std::fmt::{self, Display, Formatter};
use std::ops::{Add, AddAssign, Mul};

use pathfinding::num_traits::Zero;

/// Energy spent moving amphipods around.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct Cost(pub u64);

impl Zero for Cost {
    fn zero() -> Self {
        Cost(0)
    }
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Mul<u64> for Cost {
    type Output = Cost;
    fn mul(self, n: u64) -> <Self as Mul<u64>>::Output {
        Cost(self.0 * n)
    }
}

impl AddAssign<Cost> for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        self.0 += rhs.0
    }
}

impl Add<Cost> for Cost {
    type Output = Cost;
    fn add(self, other: Cost) -> <Self as Add<Cost>>::Output {
        Cost(self.0 + other.0)
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[test]
fn test_cost_arithmetic() {
    let mut c = Cost(10) * 3;
    assert_eq!(c, Cost(30));
    c += Cost(5);
    assert_eq!(c + Cost(1), Cost(36));
    assert!(Cost::zero().is_zero());
    assert!(!c.is_zero());
    assert_eq!(format!("{:>4}", Cost(12)), "  12");
}
