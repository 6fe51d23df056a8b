mod tests {
    use blinken_panel::channel::Channel;

    #[test]
    fn test_fifo_order() {
        let channel: Channel<u32, 8> = Channel::new();
        for i in 0..4 {
            assert_eq!(channel.send(i), None);
        }
        let receiver = channel.receiver();
        for i in 0..4 {
            assert_eq!(receiver.try_receive(), Ok(i));
        }
        assert!(receiver.try_receive().is_err());
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let channel: Channel<u32, 4> = Channel::new();
        for i in 0..4 {
            assert_eq!(channel.send(i), None);
        }
        // The queue is full: each further send evicts the head
        assert_eq!(channel.send(4), Some(0));
        assert_eq!(channel.send(5), Some(1));

        let receiver = channel.receiver();
        for i in 2..6 {
            assert_eq!(receiver.try_receive(), Ok(i));
        }
        assert!(receiver.try_receive().is_err());
    }
}
