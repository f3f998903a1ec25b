//! Cash and debt ledger
//!
//! Money never goes negative: a payment larger than the cash on hand moves
//! the shortfall into debt. The two display springs only animate the HUD.

use serde::{Deserialize, Serialize};

/// Resting offset the HUD counters slide in from
const SPRING_START: f32 = 30.0;
const SPRING_STIFFNESS: f32 = 0.05;
const SPRING_FRICTION: f32 = 0.85;

/// 1D damped spring used to bounce a HUD counter when it changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySpring {
    pub pos: f32,
    pub vel: f32,
}

impl Default for DisplaySpring {
    fn default() -> Self {
        Self {
            pos: SPRING_START,
            vel: 0.0,
        }
    }
}

impl DisplaySpring {
    /// Bump the counter
    pub fn kick(&mut self) {
        self.vel += 1.0;
    }

    /// Wiggle only if the counter is at rest
    pub fn nudge(&mut self) {
        if self.pos < 1.0 {
            self.vel = 1.0;
        }
    }

    pub fn step(&mut self) {
        self.vel -= SPRING_STIFFNESS * self.pos;
        self.vel *= SPRING_FRICTION;
        self.pos += self.vel;
    }
}

/// Result of paying toward the debt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebtPayment {
    /// Amount that went to the debt
    pub applied: u64,
    /// Overpayment returned as cash
    pub refunded: u64,
    /// This payment cleared the debt for the first time this session
    pub cleared: bool,
}

/// Money/debt ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Economy {
    money: u64,
    debt: u64,
    /// Debt has been paid off once already
    cleared: bool,
    pub money_spring: DisplaySpring,
    pub debt_spring: DisplaySpring,
}

impl Economy {
    pub fn new(starting_debt: u64) -> Self {
        Self {
            money: 0,
            debt: starting_debt,
            cleared: false,
            money_spring: DisplaySpring::default(),
            debt_spring: DisplaySpring::default(),
        }
    }

    pub fn money(&self) -> u64 {
        self.money
    }

    pub fn debt(&self) -> u64 {
        self.debt
    }

    /// True once the debt has been paid off
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn give_money(&mut self, amount: u64) {
        self.money += amount;
        self.money_spring.kick();
    }

    /// Spend `amount`; whatever cash cannot cover is added to the debt
    pub fn take_money(&mut self, amount: u64) {
        if amount <= self.money {
            self.money -= amount;
            self.money_spring.kick();
            return;
        }

        let shortfall = amount - self.money;
        self.debt += shortfall;
        self.debt_spring.kick();
        if self.money != 0 {
            self.money_spring.kick();
        }
        self.money = 0;
        log::debug!("Charged {amount} with {shortfall} added to debt");
    }

    /// Reduce the debt by `amount`, refunding anything beyond what is owed
    pub fn pay_debt(&mut self, amount: u64) -> DebtPayment {
        let applied = amount.min(self.debt);
        let refunded = amount - applied;
        self.debt -= applied;
        self.money += refunded;
        self.debt_spring.kick();

        let cleared = self.debt == 0 && !self.cleared;
        if cleared {
            self.cleared = true;
            log::info!("Debt cleared");
        }
        DebtPayment {
            applied,
            refunded,
            cleared,
        }
    }

    /// Flash the cash counter (can't afford)
    pub fn nudge_money(&mut self) {
        self.money_spring.nudge();
    }

    /// Flash the debt counter (nothing to pay)
    pub fn nudge_debt(&mut self) {
        self.debt_spring.nudge();
    }

    /// Advance both HUD springs one tick
    pub fn step_display(&mut self) {
        self.money_spring.step();
        self.debt_spring.step();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_take_money_overflows_into_debt() {
        let mut economy = Economy::new(1000);
        economy.give_money(40);
        economy.take_money(100);
        assert_eq!(economy.money(), 0);
        assert_eq!(economy.debt(), 1060);
    }

    #[test]
    fn test_debt_spring_untouched_when_affordable() {
        let mut economy = Economy::new(1000);
        economy.give_money(200);
        let debt_before = economy.debt_spring;
        let money_vel = economy.money_spring.vel;

        economy.take_money(100);
        assert_eq!(economy.debt_spring, debt_before);
        assert_eq!(economy.money_spring.vel, money_vel + 1.0);
    }

    #[test]
    fn test_money_spring_untouched_when_broke() {
        let mut economy = Economy::new(0);
        let before = economy.money_spring;
        economy.take_money(100);
        assert_eq!(economy.money_spring, before);
        assert_eq!(economy.debt_spring.vel, 1.0);
        assert_eq!(economy.debt(), 100);
    }

    #[test]
    fn test_pay_debt_refunds_overpayment_and_clears_once() {
        let mut economy = Economy::new(150);

        let first = economy.pay_debt(100);
        assert_eq!(first.applied, 100);
        assert!(!first.cleared);

        let second = economy.pay_debt(100);
        assert_eq!(second.applied, 50);
        assert_eq!(second.refunded, 50);
        assert!(second.cleared);
        assert_eq!(economy.debt(), 0);
        assert_eq!(economy.money(), 50);

        // Falling back into debt and clearing it again is not a second win
        economy.take_money(200);
        let third = economy.pay_debt(500);
        assert!(!third.cleared);
        assert!(economy.is_cleared());
    }

    #[test]
    fn test_springs_settle() {
        let mut economy = Economy::new(0);
        economy.give_money(5);
        for _ in 0..600 {
            economy.step_display();
        }
        assert!(economy.money_spring.pos.abs() < 0.01);
        assert!(economy.debt_spring.pos.abs() < 0.01);
    }

    #[test]
    fn test_nudge_only_at_rest() {
        let mut spring = DisplaySpring::default();
        spring.nudge();
        assert_eq!(spring.vel, 0.0);

        spring.pos = 0.0;
        spring.nudge();
        assert_eq!(spring.vel, 1.0);
    }

    proptest! {
        #[test]
        fn prop_net_position_tracks_every_call(
            start_debt in 0u64..5_000,
            ops in proptest::collection::vec((any::<bool>(), 0u64..500), 0..64),
        ) {
            let mut economy = Economy::new(start_debt);
            let mut total_before = start_debt as i128;
            for (give, amount) in ops {
                if give {
                    economy.give_money(amount);
                    total_before -= amount as i128;
                } else {
                    economy.take_money(amount);
                    total_before += amount as i128;
                }
                // Net position (debt - money) moves exactly by each amount
                prop_assert_eq!(economy.debt() as i128 - economy.money() as i128, total_before);
            }
        }

        #[test]
        fn prop_matched_take_give_restores_money(
            money in 0u64..10_000,
            amount in 0u64..10_000,
        ) {
            prop_assume!(amount <= money);
            let mut economy = Economy::new(1000);
            economy.give_money(money);
            economy.take_money(amount);
            economy.give_money(amount);
            prop_assert_eq!(economy.money(), money);
            prop_assert_eq!(economy.debt(), 1000);
        }
    }
}
