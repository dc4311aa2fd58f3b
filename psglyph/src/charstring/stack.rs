//! Operand stack for charstring evaluation.

use crate::{types::Fixed, Error};

/// Maximum size of the operand stack.
///
/// See "Appendix B Type 2 Charstring Implementation Limits" at
/// <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=33>
pub const MAX_STACK: usize = 48;

/// Fixed capacity operand stack.
///
/// Both charstring dialects keep every operand in the same 24.8 fixed
/// point format used for device coordinates; integers are converted on
/// push.
#[derive(Clone)]
pub struct Stack {
    values: [Fixed; MAX_STACK],
    top: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Stack {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self {
            values: [Fixed::ZERO; MAX_STACK],
            top: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    pub fn len(&self) -> usize {
        self.top
    }

    /// Returns true if the number of elements on the stack is odd.
    pub fn len_is_odd(&self) -> bool {
        self.top & 1 != 0
    }

    pub fn clear(&mut self) {
        self.top = 0;
    }

    pub fn truncate(&mut self, len: usize) {
        self.top = self.top.min(len);
    }

    pub fn values(&self) -> &[Fixed] {
        &self.values[..self.top]
    }

    pub fn values_mut(&mut self) -> &mut [Fixed] {
        &mut self.values[..self.top]
    }

    pub fn push(&mut self, value: Fixed) -> Result<(), Error> {
        if self.top == MAX_STACK {
            return Err(Error::StackOverflow);
        }
        self.values[self.top] = value;
        self.top += 1;
        Ok(())
    }

    pub fn push_i32(&mut self, value: i32) -> Result<(), Error> {
        self.push(Fixed::from_i32(value))
    }

    pub fn pop(&mut self) -> Result<Fixed, Error> {
        if self.top == 0 {
            return Err(Error::StackUnderflow);
        }
        self.top -= 1;
        Ok(self.values[self.top])
    }

    /// Pops a value and returns its integer part.
    pub fn pop_i32(&mut self) -> Result<i32, Error> {
        Ok(self.pop()?.to_i32())
    }

    /// Returns the value at the given index from the bottom of the stack.
    pub fn get(&self, index: usize) -> Result<Fixed, Error> {
        self.values()
            .get(index)
            .copied()
            .ok_or(Error::InvalidStackAccess(index))
    }

    /// Returns the value at the given depth from the top of the stack,
    /// where a depth of 0 is the top element.
    pub fn peek(&self, depth: usize) -> Result<Fixed, Error> {
        self.top
            .checked_sub(depth + 1)
            .map(|ix| self.values[ix])
            .ok_or(Error::StackUnderflow)
    }

    /// Returns an array of `N` values starting at `first_index`.
    pub fn get_array<const N: usize>(&self, first_index: usize) -> Result<[Fixed; N], Error> {
        let end = first_index + N;
        if end > self.top {
            return Err(Error::InvalidStackAccess(end - 1));
        }
        let mut result = [Fixed::ZERO; N];
        result.copy_from_slice(&self.values[first_index..end]);
        Ok(result)
    }

    /// Removes and returns the bottom element, shifting the remaining
    /// elements down.
    pub fn remove_first(&mut self) -> Result<Fixed, Error> {
        if self.top == 0 {
            return Err(Error::StackUnderflow);
        }
        let first = self.values[0];
        self.values.copy_within(1..self.top, 0);
        self.top -= 1;
        Ok(first)
    }

    /// Rotates the top `count` elements by `distance` positions toward the
    /// top of the stack. Negative distances rotate toward the bottom.
    pub fn roll(&mut self, count: i32, distance: i32) -> Result<(), Error> {
        if count < 0 || count as usize > self.top {
            return Err(Error::InvalidStackAccess(count.max(0) as usize));
        }
        if count == 0 {
            return Ok(());
        }
        let distance = if distance < 0 {
            count - (-(distance as i64) % count as i64) as i32
        } else {
            distance % count
        };
        let bottom = self.top - count as usize;
        self.values[bottom..self.top].rotate_right(distance as usize % count as usize);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(values: &[i32]) -> Stack {
        let mut stack = Stack::new();
        for value in values {
            stack.push_i32(*value).unwrap();
        }
        stack
    }

    fn ints(stack: &Stack) -> Vec<i32> {
        stack.values().iter().map(|v| v.to_i32()).collect()
    }

    #[test]
    fn push_pop_limits() {
        let mut stack = Stack::new();
        for i in 0..MAX_STACK as i32 {
            stack.push_i32(i).unwrap();
        }
        assert_eq!(stack.push_i32(0), Err(Error::StackOverflow));
        assert_eq!(stack.pop_i32().unwrap(), MAX_STACK as i32 - 1);
        stack.clear();
        assert_eq!(stack.pop(), Err(Error::StackUnderflow));
    }

    #[test]
    fn array_access() {
        let stack = stack_of(&[1, 2, 3]);
        assert_eq!(
            stack.get_array::<2>(1).unwrap(),
            [Fixed::from_i32(2), Fixed::from_i32(3)]
        );
        assert_eq!(stack.get_array::<2>(2), Err(Error::InvalidStackAccess(3)));
        assert_eq!(stack.peek(0).unwrap(), Fixed::from_i32(3));
        assert_eq!(stack.peek(3), Err(Error::StackUnderflow));
    }

    #[test]
    fn remove_first_shifts() {
        let mut stack = stack_of(&[7, 8, 9]);
        assert_eq!(stack.remove_first().unwrap(), Fixed::from_i32(7));
        assert_eq!(ints(&stack), [8, 9]);
    }

    #[test]
    fn roll() {
        let mut stack = stack_of(&[0, 1, 2, 3, 4]);
        stack.roll(3, 1).unwrap();
        assert_eq!(ints(&stack), [0, 1, 4, 2, 3]);
        stack.roll(3, -1).unwrap();
        assert_eq!(ints(&stack), [0, 1, 2, 3, 4]);
        stack.roll(5, 7).unwrap();
        assert_eq!(ints(&stack), [3, 4, 0, 1, 2]);
        assert!(stack.roll(6, 1).is_err());
        assert!(stack.roll(-1, 1).is_err());
    }
}
